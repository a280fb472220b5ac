//! Violation taxonomy
//!
//! Incidents carry the violation type as a plain string so unknown types are
//! tolerated on ingestion. This enum names the known members and their
//! detection channel.

use crate::incident::IncidentSource;

/// Known violation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationType {
    /// Physical altercation
    Violence,
    /// Camera lens covered or obstructed
    CameraBlocking,
    /// Camera pointed away or tampered with
    CameraMisuse,
    /// Body camera shaken to hide footage
    CameraShake,
    /// Smoking on duty
    Smoking,
    /// Raised voice
    Shouting,
    /// Insults or threats
    AbusiveLanguage,
}

impl ViolationType {
    /// Every member of the taxonomy
    pub const ALL: [ViolationType; 7] = [
        ViolationType::Violence,
        ViolationType::CameraBlocking,
        ViolationType::CameraMisuse,
        ViolationType::CameraShake,
        ViolationType::Smoking,
        ViolationType::Shouting,
        ViolationType::AbusiveLanguage,
    ];

    /// Get the wire name of the violation type
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::Violence => "violence",
            ViolationType::CameraBlocking => "camera_blocking",
            ViolationType::CameraMisuse => "camera_misuse",
            ViolationType::CameraShake => "camera_shake",
            ViolationType::Smoking => "smoking",
            ViolationType::Shouting => "shouting",
            ViolationType::AbusiveLanguage => "abusive_language",
        }
    }

    /// Parse a violation type from its wire name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Channel that detects this kind of violation
    pub fn source(&self) -> IncidentSource {
        match self {
            ViolationType::Shouting | ViolationType::AbusiveLanguage => IncidentSource::Audio,
            _ => IncidentSource::Video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_member() {
        for v in ViolationType::ALL {
            assert_eq!(ViolationType::parse(v.as_str()), Some(v));
        }
        assert_eq!(ViolationType::parse("loitering"), None);
        assert_eq!(ViolationType::parse("Violence"), None);
    }

    #[test]
    fn test_detection_channels() {
        let audio: Vec<_> = ViolationType::ALL
            .into_iter()
            .filter(|v| v.source() == IncidentSource::Audio)
            .collect();
        assert_eq!(audio, vec![ViolationType::Shouting, ViolationType::AbusiveLanguage]);
        assert_eq!(ViolationType::CameraShake.source(), IncidentSource::Video);
    }
}
