use crate::error::PageError;

pub type PageResult<T> = Result<T, PageError>;
