//! Validation helpers for DTOs.

use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a playlist: at least one track and no blank references.
///
/// # Examples
///
/// ```ignore
/// validate_tracks(&["spotify:track:1".into()]) // Ok
/// validate_tracks(&[])                          // Err - empty
/// validate_tracks(&["  ".into()])               // Err - blank entry
/// ```
pub fn validate_tracks(tracks: &[String]) -> Result<(), ValidationError> {
    if tracks.is_empty() {
        let mut err = ValidationError::new("tracks_empty");
        err.message = Some("A playlist needs at least one track".into());
        return Err(err);
    }

    if let Some(index) = tracks.iter().position(|track| track.trim().is_empty()) {
        let mut err = ValidationError::new("tracks_blank");
        err.message = Some(format!("Track #{} is blank", index + 1).into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("Motown").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn track_lists_need_entries() {
        assert!(validate_tracks(&["track-1".to_string()]).is_ok());
        assert!(validate_tracks(&[]).is_err());
        assert!(validate_tracks(&["track-1".to_string(), " ".to_string()]).is_err());
    }
}
