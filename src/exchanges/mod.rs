pub mod bitget;
pub mod bitunix;

/// Outcome of a well-formed exchange response.
///
/// Transport, authentication and format failures are `ExchangeError`s; this
/// only separates a usable payload from an empty or refused one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Ok(T),
    Empty,
    Rejected { code: String, msg: String },
}

impl<T> Envelope<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Ok(value) => Envelope::Ok(f(value)),
            Self::Empty => Envelope::Empty,
            Self::Rejected { code, msg } => Envelope::Rejected { code, msg },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_non_ok_variants() {
        assert_eq!(Envelope::Ok(2).map(|v| v * 2), Envelope::Ok(4));
        assert_eq!(Envelope::<i32>::Empty.map(|v| v * 2), Envelope::Empty);
        assert_eq!(
            Envelope::<i32>::Rejected {
                code: "1".to_string(),
                msg: "no".to_string()
            }
            .map(|v| v * 2),
            Envelope::Rejected {
                code: "1".to_string(),
                msg: "no".to_string()
            }
        );
    }
}
