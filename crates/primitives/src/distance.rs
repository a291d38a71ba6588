use std::cmp::Ordering;

use alloy_primitives::U256;

use crate::{ADDRESS_LENGTH, Address};

/// Returns the distance between address `x` and address `y` in big-endian.
/// Does not check the length as `Address` is a fixed length.
#[inline(always)]
pub fn distance(x: &Address, y: &Address) -> U256 {
    let mut result = [0u8; ADDRESS_LENGTH];

    for (r, (&a, &b)) in result.iter_mut().zip(x.as_bytes().iter().zip(y.as_bytes())) {
        *r = a ^ b;
    }

    U256::from_be_slice(&result)
}

/// Compares `x` and `y` by their distance to `reference`.
///
/// Returns:
///   - `Ordering::Less` if `x` is closer to `reference` than `y`
///   - `Ordering::Greater` if `x` is farther from `reference` than `y`
///   - otherwise the byte-wise order of `x` and `y`, so the result is only
///     `Ordering::Equal` when `x == y`
///
/// Every consumer that ranks addresses by closeness must go through this
/// function so that listings, routing and discovery agree on one order.
#[inline(always)]
pub fn distance_cmp(reference: &Address, x: &Address, y: &Address) -> Ordering {
    let (rb, xb, yb) = (reference.as_bytes(), x.as_bytes(), y.as_bytes());

    for ((r, a), b) in rb.iter().zip(xb).zip(yb) {
        let dx = a ^ r;
        let dy = b ^ r;

        if dx != dy {
            return dx.cmp(&dy);
        }
    }

    xb.cmp(yb)
}

/// Returns `true` iff `a` is strictly closer to `reference` than `b`.
#[inline]
pub fn closer(a: &Address, b: &Address, reference: &Address) -> bool {
    distance_cmp(reference, a, b) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use std::str::FromStr;

    fn addr(b: alloy_primitives::B256) -> Address {
        Address::from(b)
    }

    #[test]
    fn distance_closer() {
        let a = addr(b256!(
            "9100000000000000000000000000000000000000000000000000000000000000"
        ));
        let x = addr(b256!(
            "8200000000000000000000000000000000000000000000000000000000000000"
        ));
        let y = addr(b256!(
            "1200000000000000000000000000000000000000000000000000000000000000"
        ));

        // 0x91 ^ 0x82 = 0x13, 0x91 ^ 0x12 = 0x83
        assert!(closer(&x, &y, &a));
        assert!(!closer(&y, &x, &a));
        assert!(a.closer(&x, &y));
    }

    #[test]
    fn distance_matches() {
        let x = addr(b256!(
            "9100000000000000000000000000000000000000000000000000000000000000"
        ));
        let y = addr(b256!(
            "8200000000000000000000000000000000000000000000000000000000000000"
        ));

        assert_eq!(
            distance(&x, &y),
            U256::from_str(
                "8593944123082061379093159043613555660984881674403010612303492563087302590464"
            )
            .unwrap()
        );
        assert_eq!(distance(&x, &y), distance(&y, &x));
        assert_eq!(distance(&x, &x), U256::ZERO);
    }

    macro_rules! distance_cmp_test {
        ($test_name:ident, $ordering:expr, $a:expr, $x:expr, $y:expr) => {
            #[test]
            fn $test_name() {
                assert_eq!(
                    distance_cmp(&addr(b256!($a)), &addr(b256!($x)), &addr(b256!($y))),
                    $ordering
                );
            }
        };
    }

    distance_cmp_test!(
        distance_cmp_eq,
        Ordering::Equal,
        "9100000000000000000000000000000000000000000000000000000000000000",
        "1200000000000000000000000000000000000000000000000000000000000000",
        "1200000000000000000000000000000000000000000000000000000000000000"
    );

    distance_cmp_test!(
        distance_cmp_gt,
        Ordering::Greater,
        "9100000000000000000000000000000000000000000000000000000000000000",
        "1200000000000000000000000000000000000000000000000000000000000000",
        "8200000000000000000000000000000000000000000000000000000000000000"
    );

    distance_cmp_test!(
        distance_cmp_lt,
        Ordering::Less,
        "9100000000000000000000000000000000000000000000000000000000000000",
        "8200000000000000000000000000000000000000000000000000000000000000",
        "1200000000000000000000000000000000000000000000000000000000000000"
    );

    #[test]
    fn distance_cmp_agrees_with_integer_distance() {
        let reference = addr(b256!(
            "00000000000000000000000000000000000000000000000000000000000000ff"
        ));
        let x = addr(b256!(
            "0000000000000000000000000000000000000000000000000000000000000100"
        ));
        let y = addr(b256!(
            "00000000000000000000000000000000000000000000000000000000000000fe"
        ));

        assert!(distance(&y, &reference) < distance(&x, &reference));
        assert_eq!(distance_cmp(&reference, &y, &x), Ordering::Less);
    }

    #[test]
    fn closer_is_irreflexive() {
        let a = Address::ZERO;
        let x = addr(b256!(
            "4000000000000000000000000000000000000000000000000000000000000000"
        ));
        assert!(!closer(&x, &x, &a));
    }
}
