mod keyed;

use proc_macro::TokenStream;

/// Derive macro for the `Keyed` trait.
///
/// Marks a struct as an item that can live in a keyed collection store.
/// The identity field is the one tagged `#[keyed(key)]`, or the field named
/// `id` when nothing is tagged.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Keyed)]
/// #[keyed(store = "tickets")]
/// struct Ticket {
///     #[keyed(key)]
///     pub id: u64,
///     pub status: String,
/// }
/// ```
///
/// When serde renames the key field, pass the serialized name so the store
/// looks up the right attribute:
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Keyed)]
/// #[serde(rename_all = "camelCase")]
/// struct Seat {
///     #[keyed(key, rename = "seatId")]
///     pub seat_id: String,
/// }
/// ```
///
/// Without `#[keyed(store = "...")]` the store name defaults to the
/// snake_case type name with an `s` appended (`Seat` -> `"seats"`).
#[proc_macro_derive(Keyed, attributes(keyed))]
pub fn derive_keyed(input: TokenStream) -> TokenStream {
    keyed::derive_keyed(input)
}
