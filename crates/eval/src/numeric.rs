//! Integer comparison and host-integer narrowing.
//!
//! Evaluation runs on arbitrary-precision `BigInt`s. Narrowing to a host
//! integer is explicit and fails with `IntegerOverflow` rather than
//! saturating or wrapping.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use statexpr_core::{BinaryOp, ExprError, ExprResult, HostInteger};

/// Truth of `left op right`. `None` for non-comparison operators.
pub fn compare_integers(op: BinaryOp, left: &BigInt, right: &BigInt) -> Option<bool> {
    let result = match op {
        BinaryOp::Equal => left == right,
        BinaryOp::NotEqual => left != right,
        BinaryOp::Less => left < right,
        BinaryOp::LessEqual => left <= right,
        BinaryOp::Greater => left > right,
        BinaryOp::GreaterEqual => left >= right,
        BinaryOp::Subtract => return None,
    };
    Some(result)
}

fn overflow(value: &BigInt, target: &str) -> ExprError {
    ExprError::IntegerOverflow {
        value: value.to_string(),
        target: target.to_string(),
    }
}

/// Converts `value` into the host integer type `T`.
pub fn narrow<T>(value: &BigInt) -> ExprResult<T>
where
    T: for<'a> TryFrom<&'a BigInt>,
{
    T::try_from(value).map_err(|_| overflow(value, std::any::type_name::<T>()))
}

/// Checks that `value` is representable in the configured host integer.
/// The value itself is returned unchanged.
pub fn fit_host(value: BigInt, host: HostInteger) -> ExprResult<BigInt> {
    let fits = match host {
        HostInteger::I32 => value.to_i32().is_some(),
        HostInteger::I64 => value.to_i64().is_some(),
        HostInteger::Unbounded => true,
    };
    if fits {
        Ok(value)
    } else {
        let target = match host {
            HostInteger::I32 => "i32",
            HostInteger::I64 => "i64",
            HostInteger::Unbounded => "unbounded",
        };
        Err(overflow(&value, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn compare_all_operators() {
        let (one, two) = (big(1), big(2));
        assert_eq!(compare_integers(BinaryOp::Equal, &one, &one), Some(true));
        assert_eq!(compare_integers(BinaryOp::NotEqual, &one, &two), Some(true));
        assert_eq!(compare_integers(BinaryOp::Less, &one, &two), Some(true));
        assert_eq!(compare_integers(BinaryOp::LessEqual, &two, &one), Some(false));
        assert_eq!(compare_integers(BinaryOp::Greater, &two, &one), Some(true));
        assert_eq!(compare_integers(BinaryOp::GreaterEqual, &one, &two), Some(false));
        assert_eq!(compare_integers(BinaryOp::Subtract, &one, &two), None);
    }

    #[test]
    fn narrow_reports_overflow() {
        assert_eq!(narrow::<i32>(&big(42)).unwrap(), 42);
        let err = narrow::<i32>(&big(i64::from(i32::MAX) + 1)).unwrap_err();
        assert_eq!(
            err,
            ExprError::IntegerOverflow {
                value: "2147483648".to_string(),
                target: "i32".to_string(),
            }
        );
        assert!(narrow::<usize>(&big(-1)).is_err());
    }

    #[test]
    fn fit_host_widths() {
        let wide = big(i64::from(i32::MIN) - 1);
        assert!(fit_host(wide.clone(), HostInteger::I32).is_err());
        assert_eq!(fit_host(wide.clone(), HostInteger::I64).unwrap(), wide);
        let huge: BigInt = BigInt::from(i64::MAX) * 4;
        assert!(fit_host(huge.clone(), HostInteger::I64).is_err());
        assert_eq!(fit_host(huge.clone(), HostInteger::Unbounded).unwrap(), huge);
    }
}
