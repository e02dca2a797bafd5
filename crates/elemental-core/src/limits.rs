//! Request validation limits

/// Maximum length for element names (256 chars)
pub const MAX_ELEMENT_NAME_LEN: usize = 256;

/// Maximum distinct paths a single request may ask for (100)
pub const MAX_WANTED_PATHS: usize = 100;

/// Maximum overall deadline for a multi-path search (600s)
pub const MAX_DEADLINE_SECS: u64 = 600;

/// Maximum start elements in one request (64)
pub const MAX_START_ELEMENTS: usize = 64;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyElementName,
    ElementNameTooLong { len: usize, max: usize },
    NoPathsRequested,
    TooManyPaths { count: usize, max: usize },
    ZeroDeadline,
    DeadlineTooLong { secs: u64, max: u64 },
    NoStartElements,
    TooManyStartElements { count: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyElementName => write!(f, "Element name cannot be empty"),
            Self::ElementNameTooLong { len, max } => {
                write!(f, "Element name too long: {} chars (max {})", len, max)
            }
            Self::NoPathsRequested => write!(f, "At least one path must be requested"),
            Self::TooManyPaths { count, max } => {
                write!(f, "Too many paths requested: {} (max {})", count, max)
            }
            Self::ZeroDeadline => write!(f, "Deadline must be at least one second"),
            Self::DeadlineTooLong { secs, max } => {
                write!(f, "Deadline too long: {}s (max {}s)", secs, max)
            }
            Self::NoStartElements => write!(f, "At least one start element is required"),
            Self::TooManyStartElements { count, max } => {
                write!(f, "Too many start elements: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate an element name
pub fn validate_element_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyElementName);
    }
    if name.len() > MAX_ELEMENT_NAME_LEN {
        return Err(ValidationError::ElementNameTooLong {
            len: name.len(),
            max: MAX_ELEMENT_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate the requested path count
pub fn validate_wanted_paths(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::NoPathsRequested);
    }
    if count > MAX_WANTED_PATHS {
        return Err(ValidationError::TooManyPaths {
            count,
            max: MAX_WANTED_PATHS,
        });
    }
    Ok(())
}

/// Validate a multi-path deadline in seconds
pub fn validate_deadline_secs(secs: u64) -> Result<(), ValidationError> {
    if secs == 0 {
        return Err(ValidationError::ZeroDeadline);
    }
    if secs > MAX_DEADLINE_SECS {
        return Err(ValidationError::DeadlineTooLong {
            secs,
            max: MAX_DEADLINE_SECS,
        });
    }
    Ok(())
}

/// Validate a start set
pub fn validate_start_elements<S: AsRef<str>>(start: &[S]) -> Result<(), ValidationError> {
    if start.is_empty() {
        return Err(ValidationError::NoStartElements);
    }
    if start.len() > MAX_START_ELEMENTS {
        return Err(ValidationError::TooManyStartElements {
            count: start.len(),
            max: MAX_START_ELEMENTS,
        });
    }
    for name in start {
        validate_element_name(name.as_ref())?;
    }
    Ok(())
}
