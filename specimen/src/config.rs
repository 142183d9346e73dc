//! Configuration types controlling synthesis parameters.

use crate::error::SpecimenError;

/// How `Option<T>` values are populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionalMode {
    /// Coin flip between `None` and a freshly synthesized value
    #[default]
    CoinFlip,
    /// Always synthesize a present value (until the recursion guard halts)
    AlwaysPresent,
}

/// How `String` values are composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// Random characters from the fixed alphanumeric alphabet
    #[default]
    Random,
    /// Seed the value with the name of the property currently being filled
    PropertyBased,
}

/// Immutable snapshot of synthesis parameters, passed unmodified down every
/// recursive call.
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Depth at which composite descent stops filling nested nodes
    pub max_depth: usize,
    /// Minimum element count for sequences
    pub min_count: usize,
    /// Maximum element count for sequences and dictionaries
    pub max_count: usize,
    /// Minimum generated text length
    pub min_text_len: usize,
    /// Maximum generated text length
    pub max_text_len: usize,
    /// Optional wrapper behavior
    pub optional_mode: OptionalMode,
    /// Text composition behavior
    pub naming_mode: NamingMode,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_count: 1,
            max_count: 10,
            min_text_len: 4,
            max_text_len: 16,
            optional_mode: OptionalMode::CoinFlip,
            naming_mode: NamingMode::Random,
        }
    }
}

impl FillOptions {
    /// Create options with validation
    pub fn new(
        max_depth: usize,
        min_count: usize,
        max_count: usize,
        min_text_len: usize,
        max_text_len: usize,
    ) -> Result<Self, SpecimenError> {
        let options = Self {
            max_depth,
            min_count,
            max_count,
            min_text_len,
            max_text_len,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    /// Validate the option bounds
    pub fn validate(&self) -> Result<(), SpecimenError> {
        if self.min_count > self.max_count {
            return Err(SpecimenError::invalid_argument(format!(
                "min_count {} exceeds max_count {}",
                self.min_count, self.max_count
            )));
        }
        if self.max_count == 0 {
            return Err(SpecimenError::invalid_argument(
                "max_count must be greater than zero",
            ));
        }
        if self.max_text_len == 0 {
            return Err(SpecimenError::invalid_argument(
                "max_text_len must be greater than zero",
            ));
        }
        if self.min_text_len > self.max_text_len {
            return Err(SpecimenError::invalid_argument(format!(
                "min_text_len {} exceeds max_text_len {}",
                self.min_text_len, self.max_text_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_validate() {
        assert!(FillOptions::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_count_bounds_rejected() {
        let result = FillOptions::new(3, 10, 2, 1, 8);
        assert!(matches!(
            result,
            Err(SpecimenError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_inverted_text_bounds_rejected() {
        let result = FillOptions::new(3, 1, 5, 9, 2);
        assert!(matches!(
            result,
            Err(SpecimenError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_zero_max_count_rejected() {
        let mut options = FillOptions::default();
        options.min_count = 0;
        options.max_count = 0;
        assert!(options.validate().is_err());
    }
}
