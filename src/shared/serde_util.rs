//! Custom serde helpers for backend wire formats.

/// Integers that arrive either as decimal strings or JSON numbers.
///
/// Big amounts (token units, liquidity, sqrt prices) are sent as strings so
/// they survive JavaScript clients; the normalized tree lowers revived
/// integers back to strings as well. Serializes as a decimal string.
pub mod int_str {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;
    use std::marker::PhantomData;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: fmt::Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + TryFrom<i128> + TryFrom<u128>,
        <T as FromStr>::Err: fmt::Display,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IntVisitor(PhantomData))
    }

    pub(super) struct IntVisitor<T>(pub(super) PhantomData<T>);

    impl<'de, T> Visitor<'de> for IntVisitor<T>
    where
        T: FromStr + TryFrom<i128> + TryFrom<u128>,
        <T as FromStr>::Err: fmt::Display,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer or a decimal integer string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            v.trim().parse::<T>().map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            <T as TryFrom<i128>>::try_from(i128::from(v)).map_err(|_| E::custom(format!("{} out of range", v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            <T as TryFrom<u128>>::try_from(u128::from(v)).map_err(|_| E::custom(format!("{} out of range", v)))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<T, E> {
            <T as TryFrom<i128>>::try_from(v).map_err(|_| E::custom(format!("{} out of range", v)))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<T, E> {
            <T as TryFrom<u128>>::try_from(v).map_err(|_| E::custom(format!("{} out of range", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
            if v.fract() == 0.0 && v.abs() < 1e38 {
                self.visit_i128(v as i128)
            } else {
                Err(E::custom(format!("{} is not an integer", v)))
            }
        }
    }
}

/// Nullable variant of [`int_str`].
pub mod int_str_opt {
    use super::int_str::IntVisitor;
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;
    use std::marker::PhantomData;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: fmt::Display,
        S: Serializer,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr + TryFrom<i128> + TryFrom<u128>,
        <T as FromStr>::Err: fmt::Display,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptVisitor(PhantomData))
    }

    struct OptVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for OptVisitor<T>
    where
        T: FromStr + TryFrom<i128> + TryFrom<u128>,
        <T as FromStr>::Err: fmt::Display,
    {
        type Value = Option<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("null, an integer or a decimal integer string")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(IntVisitor(PhantomData)).map(Some)
        }
    }
}

/// Floats that may arrive as JSON numbers or numeric strings (`"123.45"`).
pub mod float {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim().parse::<f64>().map_err(E::custom)
        }
    }
}
