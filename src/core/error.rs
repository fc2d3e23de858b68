use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// 固定容量表格以錯誤長度建構
    Shape(ShapeError),
    /// 存取子收到超出範圍的座標或索引
    Range(RangeError),
    /// 設定檔 JSON 解析失敗
    Config(serde_json::Error),
    /// 幀交換通道的另一端已關閉
    Disconnected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Shape(e) => write!(f, "{}", e),
            Error::Range(e) => write!(f, "{}", e),
            Error::Config(e) => write!(f, "invalid render config: {}", e),
            Error::Disconnected => write!(f, "frame exchange disconnected"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Error::Shape(err)
    }
}

impl From<RangeError> for Error {
    fn from(err: RangeError) -> Self {
        Error::Range(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    pub what: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl ShapeError {
    pub fn check(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::Shape(ShapeError {
                what,
                expected,
                actual,
            }))
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected number of {} provided: {} (expected: {})",
            self.what, self.actual, self.expected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeError {
    pub what: &'static str,
    pub value: usize,
    pub bound: usize,
}

impl RangeError {
    /// 檢查 `value < bound`
    pub fn check(what: &'static str, value: usize, bound: usize) -> Result<usize> {
        if value < bound {
            Ok(value)
        } else {
            Err(Error::Range(RangeError { what, value, bound }))
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} is out of bounds: {} (expected: value < {})",
            self.what, self.value, self.bound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_check_reports_counts() {
        assert!(ShapeError::check("tiles", 256, 256).is_ok());
        let err = ShapeError::check("tiles", 256, 255).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape(ShapeError {
                expected: 256,
                actual: 255,
                ..
            })
        ));
        assert_eq!(
            err.to_string(),
            "unexpected number of tiles provided: 255 (expected: 256)"
        );
    }

    #[test]
    fn test_range_check_rejects_bound() {
        assert_eq!(RangeError::check("x", 7, 8).unwrap(), 7);
        assert!(RangeError::check("x", 8, 8).is_err());
        assert!(RangeError::check("x", usize::MAX, 8).is_err());
        let err = RangeError::check("tile x", 32, 32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "requested tile x is out of bounds: 32 (expected: value < 32)"
        );
    }
}
