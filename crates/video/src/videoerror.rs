use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    PermissionDenied(String),
    NoDevices,
    UnknownDevice(String),
    Device(String),
    Stream(String),
    Channel(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            VideoError::NoDevices => write!(f, "no video capture devices found"),
            VideoError::UnknownDevice(id) => write!(f, "unknown video device: {id}"),
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => VideoError::PermissionDenied(err.to_string()),
            _ => VideoError::Device(err.to_string()),
        }
    }
}
