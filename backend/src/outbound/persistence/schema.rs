//! Diesel table definitions; must match `migrations/`.

diesel::table! {
    /// Tax worksheets.
    ///
    /// `type` and `status` are free text so rows written by other clients
    /// with labels outside the catalogue still load.
    worksheets (id) {
        id -> Uuid,
        client_name -> Text,
        #[sql_name = "type"]
        tax_type -> Text,
        period -> Text,
        status -> Text,
        assignee -> Nullable<Text>,
        amount -> Nullable<Float8>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
