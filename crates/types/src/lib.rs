//! Validated text types shared across the clinform crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Returns `true` when `input` has no non-whitespace characters.
///
/// This is the single definition of "blank" used for required-field checks and for the report
/// omission rule.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction. Template names
/// and record collection keys are built through it, so neither is stored blank or padded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_input() {
        let text = NonEmptyText::new("  Fertility Intake  ").expect("should accept padded text");
        assert_eq!(text.as_str(), "Fertility Intake");
        assert_eq!(text.to_string(), "Fertility Intake");
        assert_eq!(text.into_inner(), "Fertility Intake");
    }

    #[test]
    fn test_new_rejects_whitespace_only() {
        assert_eq!(NonEmptyText::new("   \t"), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \n"));
        assert!(!is_blank(" 70 "));
    }
}
