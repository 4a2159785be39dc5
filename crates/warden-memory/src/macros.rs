/// Declare a stable-memory slot.
///
/// Queues the id for validation in [`MemoryRuntime::init`](crate::MemoryRuntime::init)
/// and returns the virtual memory handle so the caller can wrap it in a
/// `Cell`, `BTreeMap`, or other stable structure. Ids are namespaced by
/// `CARGO_PKG_NAME`.
#[macro_export]
macro_rules! ic_memory {
    ($label:path, $id:expr) => {{
        // compile-time check that the label names a real type
        let _type_check: Option<$label> = None;

        $crate::registry::defer_register($id, env!("CARGO_PKG_NAME"), stringify!($label));

        $crate::manager::MEMORY_MANAGER
            .with_borrow_mut(|mgr| mgr.get($crate::cdk::structures::memory::MemoryId::new($id)))
    }};
}

/// Run `$body` at process start-up through `ctor`.
#[macro_export]
macro_rules! eager_init {
    ($body:block) => {
        #[$crate::__reexports::ctor::ctor(unsafe, anonymous, crate_path = $crate::__reexports::ctor)]
        fn __warden_eager_init() {
            $body
        }
    };
}

/// Declare a thread-local static that is touched during eager init, so its
/// stable memory is claimed before any entry point runs. One per module.
#[macro_export]
macro_rules! eager_static {
    ($vis:vis static $name:ident : $ty:ty = $init:expr;) => {
        thread_local! {
            $vis static $name: $ty = $init;
        }

        fn __touch_tls() {
            $name.with(|_| {});
        }

        $crate::eager_init!({
            $crate::runtime::defer_tls_initializer(__touch_tls);
        });
    };
}

/// Implement `Storable` with a bounded CBOR encoding.
#[macro_export]
macro_rules! impl_storable_bounded {
    ($ident:ident, $max_size:expr, $is_fixed_size:expr) => {
        impl $crate::cdk::structures::storable::Storable for $ident {
            const BOUND: $crate::cdk::structures::storable::Bound =
                $crate::cdk::structures::storable::Bound::Bounded {
                    max_size: $max_size,
                    is_fixed_size: $is_fixed_size,
                };

            fn to_bytes(&self) -> ::std::borrow::Cow<'_, [u8]> {
                ::std::borrow::Cow::Owned(
                    $crate::serialize::serialize(self)
                        .unwrap_or_else(|e| $crate::cdk::trap(e.to_string())),
                )
            }

            fn into_bytes(self) -> Vec<u8> {
                $crate::serialize::serialize(&self)
                    .unwrap_or_else(|e| $crate::cdk::trap(e.to_string()))
            }

            fn from_bytes(bytes: ::std::borrow::Cow<'_, [u8]>) -> Self {
                $crate::serialize::deserialize(&bytes)
                    .unwrap_or_else(|e| $crate::cdk::trap(e.to_string()))
            }
        }
    };
}

/// Implement `Storable` with an unbounded CBOR encoding.
#[macro_export]
macro_rules! impl_storable_unbounded {
    ($ident:ident) => {
        impl $crate::cdk::structures::storable::Storable for $ident {
            const BOUND: $crate::cdk::structures::storable::Bound =
                $crate::cdk::structures::storable::Bound::Unbounded;

            fn to_bytes(&self) -> ::std::borrow::Cow<'_, [u8]> {
                ::std::borrow::Cow::Owned(
                    $crate::serialize::serialize(self)
                        .unwrap_or_else(|e| $crate::cdk::trap(e.to_string())),
                )
            }

            fn into_bytes(self) -> Vec<u8> {
                $crate::serialize::serialize(&self)
                    .unwrap_or_else(|e| $crate::cdk::trap(e.to_string()))
            }

            fn from_bytes(bytes: ::std::borrow::Cow<'_, [u8]>) -> Self {
                $crate::serialize::deserialize(&bytes)
                    .unwrap_or_else(|e| $crate::cdk::trap(e.to_string()))
            }
        }
    };
}
