use crate::domain::errors::BucketNameError;

/// A validated bucket name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Create a new BucketName, enforcing GCS naming rules.
    pub fn new(value: String) -> Result<Self, BucketNameError> {
        if value.len() < 3 || value.len() > 63 {
            return Err(BucketNameError::InvalidLength {
                actual: value.len(),
                min: 3,
                max: 63,
            });
        }

        // Must start and end with a lowercase letter or number
        let first = value.chars().next().unwrap();
        let last = value.chars().last().unwrap();
        if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
            return Err(BucketNameError::InvalidBoundary);
        }
        if !last.is_ascii_lowercase() && !last.is_ascii_digit() {
            return Err(BucketNameError::InvalidBoundary);
        }

        // Lowercase letters, digits, hyphens, underscores and dots
        for c in value.chars() {
            if !c.is_ascii_lowercase()
                && !c.is_ascii_digit()
                && c != '-'
                && c != '_'
                && c != '.'
            {
                return Err(BucketNameError::InvalidCharacter(c));
            }
        }

        Ok(Self(value))
    }

    /// Get the bucket name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BucketName {
    type Err = BucketNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketName::new(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bucket_names() {
        assert!(BucketName::new("my-bucket".to_string()).is_ok());
        assert!(BucketName::new("bucket123".to_string()).is_ok());
        assert!(BucketName::new("my_bucket.backup".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_bucket_names() {
        // Too short
        assert!(BucketName::new("ab".to_string()).is_err());

        // Too long
        assert!(BucketName::new("a".repeat(64)).is_err());

        // Invalid start/end
        assert!(BucketName::new("-bucket".to_string()).is_err());
        assert!(BucketName::new("bucket-".to_string()).is_err());
        assert!(BucketName::new("Bucket12".to_string()).is_err());

        // Invalid characters
        assert!(BucketName::new("my bucket".to_string()).is_err());
        assert!(BucketName::new("my/bucket".to_string()).is_err());
    }
}
