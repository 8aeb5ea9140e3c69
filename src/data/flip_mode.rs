/// Horizontal-flip policy for the augmentation stage.
///
/// `Always` is used for test-time augmentation, `Random` for training.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum FlipMode {
    #[default] Random,
    Always,
    None,
}

impl FlipMode {
    pub fn name(&self) -> String {
        match self {
            Self::Random => "random".to_string(),
            Self::Always => "always".to_string(),
            Self::None => "none".to_string(),
        }
    }

    pub fn from(mode: String) -> FlipMode {
        match mode.to_lowercase().as_str() {
            "random" => FlipMode::Random,
            "always" => FlipMode::Always,
            "none" => FlipMode::None,
            _ => FlipMode::Random,
        }
    }
}
