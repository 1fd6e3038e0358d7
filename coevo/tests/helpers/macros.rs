// See https://stackoverflow.com/questions/34662713/how-can-i-create-parameterized-tests-in-rust
macro_rules! with_dollar_sign {
    ($($body:tt)*) => {
        macro_rules! __with_dollar_sign { $($body)* }
        __with_dollar_sign!($);
    }
}

#[macro_export]
macro_rules! parameterized_test {
    ($name:ident, $args:pat, $body:tt) => {
        with_dollar_sign! {
        ($d:tt) => {
            macro_rules! $name {
                ($d($d pname:ident: $d values:expr,)*) => {
                    mod $name {
                        use super::*;
                        $d(
                            #[test]
                            fn $d pname() {
                                let $args = $d values;
                                $body
                            }
                        )*
                    }}}}}
    };
}

#[macro_export]
macro_rules! assert_float_eq {
    ($left:expr, $right:expr) => {{
        let (left, right): (f64, f64) = ($left, $right);
        assert!((left - right).abs() < 1E-9, "assertion failed: `{} ~= {}`", left, right);
    }};
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right): (f64, f64) = ($left, $right);
        assert!((left - right).abs() < $tolerance, "assertion failed: `{} ~= {}`", left, right);
    }};
}
