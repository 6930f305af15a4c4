use serde::{de::DeserializeOwned, Serialize};
use strata_core::Capabilities;

/// A value the codec can marshal.
///
/// Implementors declare which wire formats they support through
/// [`CAPABILITIES`](Self::CAPABILITIES). Types that stand for a polymorphic
/// field are closed tagged unions (Rust enums) that set
/// [`INTERFACE`](Self::INTERFACE) and report their variant through
/// [`concrete_tag`](Self::concrete_tag).
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use strata::codec::Encodable;
/// use strata::Capabilities;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Account {
///     addr: String,
///     balance: u64,
/// }
///
/// impl Encodable for Account {}
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct LegacyReceipt {
///     hash: Vec<u8>,
/// }
///
/// impl Encodable for LegacyReceipt {
///     const CAPABILITIES: Capabilities = Capabilities::LegacyOnly;
/// }
/// ```
pub trait Encodable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Formats this type can be carried in
    const CAPABILITIES: Capabilities = Capabilities::Both;

    /// Name of the interface this type implements as a tagged union, if any
    const INTERFACE: Option<&'static str> = None;

    /// Registered tag of the variant held by this value
    ///
    /// Only meaningful when [`INTERFACE`](Self::INTERFACE) is set.
    fn concrete_tag(&self) -> Option<&'static str> {
        None
    }

    /// Name used in error messages
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

macro_rules! impl_encodable {
    ($($ty:ty),* $(,)?) => {
        $(impl Encodable for $ty {})*
    };
}

impl_encodable!(bool, u8, u16, u32, u64, i8, i16, i32, i64, String, Vec<u8>);
