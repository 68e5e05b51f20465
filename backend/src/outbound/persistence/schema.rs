//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// User accounts.
    ///
    /// Email and username are unique among rows with `is_active = true`
    /// (partial unique indexes). Counters are `CHECK`ed non-negative.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login email.
        email -> Text,
        /// Public handle.
        username -> Text,
        /// Name shown to other users.
        display_name -> Text,
        /// One-way password hash; never selected by snapshot reads.
        password_hash -> Text,
        /// Avatar location.
        profile_image_url -> Nullable<Text>,
        /// Free-form biography.
        bio -> Nullable<Text>,
        /// Self-reported country.
        country -> Nullable<Text>,
        /// Account verification flag.
        is_verified -> Bool,
        /// Artist account flag.
        is_artist -> Bool,
        /// Cleared on soft deactivation.
        is_active -> Bool,
        /// Number of edges pointing at this user.
        follower_count -> Int8,
        /// Number of edges leaving this user.
        following_count -> Int8,
        /// Registration timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
        /// Most recent successful login.
        last_login -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Directed follow edges.
    ///
    /// The composite primary key makes each ordered pair unique; a `CHECK`
    /// forbids self-follows and both columns reference `users(id)`.
    user_follows (follower_id, followee_id) {
        /// User doing the following.
        follower_id -> Uuid,
        /// User being followed.
        followee_id -> Uuid,
        /// Edge creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, user_follows);
