use crate::core::types::primitive::IntegerType;
use crate::core::types::ty::CType;

/// usual arithmetic conversions over integer types
pub fn promote_integers(left: IntegerType, right: IntegerType) -> IntegerType {
    // anything narrower than int becomes int
    let promote = |t: IntegerType| if t.size_in_bytes() < 4 { IntegerType::Int } else { t };
    let (l, r) = (promote(left), promote(right));

    if l == r {
        return l;
    }
    if l.is_signed() == r.is_signed() {
        return if l.rank() >= r.rank() { l } else { r };
    }

    let (signed, unsigned) = if l.is_signed() { (l, r) } else { (r, l) };
    if unsigned.rank() >= signed.rank() {
        unsigned
    } else if signed.size_in_bytes() > unsigned.size_in_bytes() {
        signed
    } else {
        signed.to_unsigned()
    }
}

/// common type 4 two arithmetic operands, none if either is not arithmetic
pub fn promo_type(left: &CType, right: &CType) -> Option<CType> {
    let l = left.integer_type()?;
    let r = right.integer_type()?;
    Some(CType::integer(promote_integers(l, r)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use IntegerType::*;

    #[test]
    fn test_narrow_types_promote_to_int() {
        assert_eq!(promote_integers(Char, Short), Int);
        assert_eq!(promote_integers(Bool, UChar), Int);
        assert_eq!(promote_integers(UShort, UShort), Int);
    }

    #[test]
    fn test_rank_ties() {
        assert_eq!(promote_integers(Int, UInt), UInt);
        assert_eq!(promote_integers(Long, ULong), ULong);
        assert_eq!(promote_integers(Long, LongLong), LongLong);
        assert_eq!(promote_integers(ULong, LongLong), ULongLong);
    }

    #[test]
    fn test_signed_wins_when_wider() {
        assert_eq!(promote_integers(Long, UInt), Long);
        assert_eq!(promote_integers(UInt, LongLong), LongLong);
    }
}
