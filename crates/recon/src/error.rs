use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad row offset, bad column letter, etc.).
    ConfigValidation(String),
    /// A vote reached the engine without a voter identity.
    EmptyVoter { ballot: String },
    /// A vote reached the engine without a ballot name.
    EmptyBallot { voter: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::EmptyVoter { ballot } => {
                write!(f, "vote on ballot '{ballot}' has an empty voter")
            }
            Self::EmptyBallot { voter } => {
                write!(f, "vote by '{voter}' has an empty ballot name")
            }
        }
    }
}

impl std::error::Error for ReconError {}
