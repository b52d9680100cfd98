use crate::errors::RunError;

// because math is hard

/// the folding arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
        }
    }

    /// integers wrap on overflow; `/` and `%` truncate toward zero
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, RunError> {
        match self {
            Op::Add => Ok(lhs.wrapping_add(rhs)),
            Op::Sub => Ok(lhs.wrapping_sub(rhs)),
            Op::Mul => Ok(lhs.wrapping_mul(rhs)),
            Op::Div | Op::Rem if rhs == 0 => Err(RunError::DivideByZero),
            Op::Div => Ok(lhs.wrapping_div(rhs)),
            Op::Rem => Ok(lhs.wrapping_rem(rhs)),
        }
    }

    /// fold the operands left to right. a lone operand to `-` is negated.
    pub fn fold(self, operands: Vec<i64>) -> Result<i64, RunError> {
        let mut operands = operands.into_iter();

        let first = operands.next().ok_or_else(|| RunError::ProcError {
            name: self.symbol().to_owned(),
            msg: "at least 1 argument required".to_owned(),
        })?;

        if self == Op::Sub && operands.len() == 0 {
            return Ok(first.wrapping_neg());
        }

        operands.try_fold(first, |acc, n| self.apply(acc, n))
    }
}

/// the ordering operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
        }
    }

    pub fn test(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
        }
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_left_to_right() {
        assert_eq!(Op::Sub.fold(vec![10, 3, 2]).unwrap(), 5);
        assert_eq!(Op::Div.fold(vec![100, 5, 2]).unwrap(), 10);
        assert_eq!(Op::Add.fold(vec![7]).unwrap(), 7);
    }

    #[test]
    fn unary_minus_negates() {
        assert_eq!(Op::Sub.fold(vec![4]).unwrap(), -4);
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(Op::Div.apply(-7, 2).unwrap(), -3);
        assert_eq!(Op::Rem.apply(-7, 2).unwrap(), -1);
    }

    #[test]
    fn zero_divisor_is_an_error() {
        assert!(matches!(Op::Div.apply(5, 0), Err(RunError::DivideByZero)));
        assert!(matches!(Op::Rem.fold(vec![5, 0]), Err(RunError::DivideByZero)));
    }

    #[test]
    fn overflow_wraps() {
        assert_eq!(Op::Add.apply(i64::MAX, 1).unwrap(), i64::MIN);
        assert_eq!(Op::Div.apply(i64::MIN, -1).unwrap(), i64::MIN);
    }

    #[test]
    fn no_operands_is_an_error() {
        let err = Op::Mul.fold(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "*: at least 1 argument required");
    }

    #[test]
    fn comparisons() {
        assert!(Comparison::Gt.test(2, 1));
        assert!(!Comparison::Lt.test(2, 1));
        assert!(Comparison::Ge.test(2, 2));
        assert!(Comparison::Le.test(1, 2));
        assert_eq!(Comparison::Le.symbol(), "<=");
    }
}
// }}}
