
#[derive(Debug)]
pub enum Error {
    WrongStart,
    UnexpectedEof,
    IllegalSubIteration(&'static str),
    InvalidPage(u64),
    BadString(std::str::Utf8Error),
    BadMemberType(u8),
    Store(rocksdb::Error),
    Io(std::io::Error),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::WrongStart => write!(f, "file does not start with the o5m reset byte"),
            Error::UnexpectedEof => write!(f, "unexpected end of file"),
            Error::IllegalSubIteration(what) => {
                write!(f, "{} iteration is not allowed here", what)
            }
            Error::InvalidPage(id) => write!(f, "page {} does not exist", id),
            Error::BadString(e) => write!(f, "string data is not utf-8: {}", e),
            Error::BadMemberType(b) => write!(f, "unknown member type byte {:#x}", b),
            Error::Store(e) => write!(f, "store error: {}", e),
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::convert::From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Store(e)
    }
}

impl std::convert::From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Error::BadString(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
