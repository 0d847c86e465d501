use crate::error::Error;

/// Per-dimension optimization sense.
///
/// `minimize[i]` is `true` when dimension `i` is better when smaller, `false`
/// when it is better when larger. Dominance comparisons orient each
/// coordinate by this vector before comparing (see [`crate::dominance`]).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionVector {
    minimize: Vec<bool>,
}

impl DirectionVector {
    /// builds a direction vector directly from booleans (`true` = minimize).
    pub fn new(minimize: impl Into<Vec<bool>>) -> Self {
        Self {
            minimize: minimize.into(),
        }
    }

    /// all-minimize direction vector of the given dimension (the default
    /// orientation when none is supplied).
    pub fn all_minimize(d: usize) -> Self {
        Self {
            minimize: vec![true; d],
        }
    }

    /// parses textual direction tokens: `"min"`/`"minimization"` -> minimize,
    /// `"max"`/`"maximization"` -> maximize. Fails with [`Error::BadDirection`]
    /// on anything else.
    pub fn from_strs<S: AsRef<str>>(tokens: &[S]) -> Result<Self, Error> {
        let minimize = tokens
            .iter()
            .map(|s| match s.as_ref() {
                "min" | "minimization" => Ok(true),
                "max" | "maximization" => Ok(false),
                other => Err(Error::BadDirection(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { minimize })
    }

    /// number of dimensions covered.
    pub fn dimensions(&self) -> usize {
        self.minimize.len()
    }

    /// whether dimension `i` is minimized.
    pub fn is_minimize(&self, i: usize) -> bool {
        self.minimize[i]
    }

    /// whether dimension `i` is maximized.
    pub fn is_maximize(&self, i: usize) -> bool {
        !self.minimize[i]
    }

    /// true iff every dimension is minimized.
    pub fn is_all_minimize(&self) -> bool {
        self.minimize.iter().all(|m| *m)
    }

    /// true iff every dimension is maximized.
    pub fn is_all_maximize(&self) -> bool {
        self.minimize.iter().all(|m| !*m)
    }

    pub(crate) fn as_slice(&self) -> &[bool] {
        &self.minimize
    }
}

impl Default for DirectionVector {
    /// all-minimize, zero dimensions; practically always replaced by
    /// [`DirectionVector::all_minimize`] once the dimension is known.
    fn default() -> Self {
        Self { minimize: Vec::new() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_known_tokens() {
        let d = DirectionVector::from_strs(&["min", "maximization", "max", "minimization"]).unwrap();
        assert_eq!(d.dimensions(), 4);
        assert!(d.is_minimize(0));
        assert!(d.is_maximize(1));
        assert!(d.is_maximize(2));
        assert!(d.is_minimize(3));
    }

    #[test]
    fn rejects_unknown_token() {
        let err = DirectionVector::from_strs(&["min", "sideways"]).unwrap_err();
        assert_eq!(err, Error::BadDirection("sideways".to_string()));
    }

    #[test]
    fn all_minimize_default() {
        let d = DirectionVector::all_minimize(3);
        assert!(d.is_all_minimize());
        assert!(!d.is_all_maximize());
    }
}
