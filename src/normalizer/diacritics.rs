//! 变音符号折叠
//!
//! 表驱动：每组带重音的字符映射为一个基础拉丁字母，连字映射为两个字母。

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

/// 折叠表（各组码位互不相交，应用顺序无关）
const FOLD_TABLE: &[(&str, &str)] = &[
    ("àâáãāåäǎ", "a"),
    ("ÀÂÁÃĀÅÄǍ", "A"),
    ("čćç", "c"),
    ("ČÇ", "C"),
    ("ðđ", "d"),
    ("ÐĐ", "D"),
    ("éěèêëėệē", "e"),
    ("ÉÈÊËĖỆĒ", "E"),
    ("ğ", "g"),
    ("Ğ", "G"),
    ("îïíīịìǐĩı", "i"),
    ("İÎÏÍĪỊÌǏ", "I"),
    ("ł", "l"),
    ("Ł", "L"),
    ("ñňń", "n"),
    ("ÑŇŃ", "N"),
    ("ôöōồǒóòøőõ", "o"),
    ("ÔÖŌỒÓÒØŐÕ", "O"),
    ("ŕ", "r"),
    ("şš", "s"),
    ("ŠŞ", "S"),
    ("ß", "ss"),
    ("ť", "t"),
    ("ûùüúǔưū", "u"),
    ("ÛÙÜÚƯŪ", "U"),
    ("ŵ", "w"),
    ("ý", "y"),
    ("Ý", "Y"),
    ("žź", "z"),
    ("ŽŹ", "Z"),
    ("æ", "ae"),
    ("Æ", "AE"),
];

/// 变音符号折叠器（构建一次，只读共享）
pub struct DiacriticFolder {
    map: HashMap<char, &'static str>,
}

impl DiacriticFolder {
    pub fn new() -> Self {
        let map = FOLD_TABLE
            .iter()
            .flat_map(|(class, base)| class.chars().map(move |ch| (ch, *base)))
            .collect();
        Self { map }
    }

    /// 折叠文本
    ///
    /// 先做 NFC 组合，使 `e` + U+0301 与预组合的 `é` 走同一条映射。
    pub fn fold(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        for ch in text.nfc() {
            match self.map.get(&ch) {
                Some(base) => result.push_str(base),
                None => result.push(ch),
            }
        }
        result
    }

    /// 是否为表中声明的带重音字符
    pub fn is_folded_char(&self, ch: char) -> bool {
        self.map.contains_key(&ch)
    }
}

impl Default for DiacriticFolder {
    fn default() -> Self {
        Self::new()
    }
}
