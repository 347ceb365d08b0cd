//! Affirmation Context - 文本规则
//!
//! 文本校验、重音折叠、slug 生成、内容指纹与朗读时长估算

use super::AffirmationError;

/// 单条肯定语最大字符数
pub const MAX_TEXT_CHARS: usize = 500;

/// 平静语速：每分钟 150 词
const WORDS_PER_MINUTE: u64 = 150;

/// 经过校验的肯定语文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffirmationText(String);

impl AffirmationText {
    pub fn new(text: impl Into<String>) -> Result<Self, AffirmationError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(AffirmationError::EmptyText);
        }
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(AffirmationError::TextTooLong(chars, MAX_TEXT_CHARS));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// TTS 计费字符数
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// 折叠葡萄牙语常见重音字符
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// 文本内容指纹，用于判断已生成音频是否过期
pub fn text_hash(text: &str) -> String {
    format!("{:x}", md5::compute(text.trim().as_bytes()))
}

/// 估算朗读时长（毫秒）
pub fn estimate_duration_ms(text: &str) -> u64 {
    let words = text.split_whitespace().count() as u64;
    words * 60 * 1000 / WORDS_PER_MINUTE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed_and_validated() {
        let text = AffirmationText::new("  Eu sou capaz.  ").unwrap();
        assert_eq!(text.as_str(), "Eu sou capaz.");

        assert!(matches!(
            AffirmationText::new("   "),
            Err(AffirmationError::EmptyText)
        ));

        let long = "a".repeat(MAX_TEXT_CHARS + 1);
        assert!(matches!(
            AffirmationText::new(long),
            Err(AffirmationError::TextTooLong(501, 500))
        ));
    }

    #[test]
    fn test_char_count_uses_unicode_scalars() {
        let text = AffirmationText::new("Saúde plena").unwrap();
        assert_eq!(text.char_count(), 11);
    }

    #[test]
    fn test_text_hash_ignores_surrounding_whitespace() {
        assert_eq!(text_hash("Eu sou calmo."), text_hash("  Eu sou calmo.\n"));
        assert_ne!(text_hash("Eu sou calmo."), text_hash("Eu sou calma."));
    }

    #[test]
    fn test_estimate_duration() {
        // 150 词 = 60 秒
        let text = vec!["palavra"; 150].join(" ");
        assert_eq!(estimate_duration_ms(&text), 60_000);
        assert_eq!(estimate_duration_ms("Eu sou capaz"), 1_200);
        assert_eq!(estimate_duration_ms(""), 0);
    }
}
