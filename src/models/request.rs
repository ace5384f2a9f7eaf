use std::fmt;

/// The unit of work the UI asks the host-processing thread to perform.
///
/// Stored in the [`Mailbox`](crate::request::Mailbox) as its `u8`
/// discriminant, so new variants only need a discriminant and a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RequestCode {
    /// Nothing pending
    #[default]
    None = 0,

    /// Build the catalog from the host document and fill the group list
    Initial = 1,

    /// Fill the attribute list for the currently selected group
    ChangeSelection = 2,
}

impl RequestCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_none(self) -> bool {
        self == RequestCode::None
    }
}

/// A mailbox discriminant that does not name any [`RequestCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownRequestCode(pub u8);

impl fmt::Display for UnknownRequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown request code {}", self.0)
    }
}

impl std::error::Error for UnknownRequestCode {}

impl TryFrom<u8> for RequestCode {
    type Error = UnknownRequestCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RequestCode::None),
            1 => Ok(RequestCode::Initial),
            2 => Ok(RequestCode::ChangeSelection),
            other => Err(UnknownRequestCode(other)),
        }
    }
}

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestCode::None => "None",
            RequestCode::Initial => "Initial",
            RequestCode::ChangeSelection => "ChangeSelection",
        };
        f.write_str(name)
    }
}
