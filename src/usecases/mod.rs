macro_rules! usecase {
    ($n:ident : { $( $i:tt )* } => { $( $o:tt )* }) => {
        pub mod $n {
            #[allow(unused_imports)]
            use crate::entities;

            #[::async_trait::async_trait]
            pub trait Usecase {
                async fn handle(&self, data: Input) -> ::anyhow::Result<Output>;
            }

            #[derive(Debug, Clone)]
            pub struct Input { $( $i )* }

            #[derive(Debug, Clone, ::serde::Serialize)]
            pub struct Output { $( $o )* }
        }
    };
}

/// `FromStr` for option enums, matching their snake_case names.
macro_rules! option_names {
    ($t:ident { $( $v:ident => $s:literal ),* $(,)? }) => {
        impl ::core::str::FromStr for $t {
            type Err = ::anyhow::Error;

            fn from_str(s: &str) -> ::anyhow::Result<Self> {
                match s {
                    $( $s => Ok($t::$v), )*
                    _ => ::anyhow::bail!(
                        "unknown {}: `{}` (expected one of: {})",
                        stringify!($t),
                        s,
                        [$( $s ),*].join(", ")
                    ),
                }
            }
        }
    };
}

pub mod answer;
pub mod question;
pub mod search;
pub mod tag;
pub mod user;
