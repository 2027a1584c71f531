/// Generates one `#[test]` per enabled database for each listed function.
/// Every function takes a `&dyn Setup`.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+ $(,)?
    ) => {
        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    super::$f(&$crate::SetupSqlite);
                }
            )*
        }

        #[cfg(feature = "postgresql")]
        mod postgresql {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    super::$f(&$crate::SetupPostgreSQL);
                }
            )*
        }
    };
}
