// Hand-maintained: the SQL names are mixed-case, so each one is mapped
// with `sql_name` onto a snake_case Rust name.

diesel::table! {
    #[sql_name = "AccountProfile"]
    account_profile (id) {
        id -> BigInt,
        #[sql_name = "OAuthID"]
        oauth_id -> Text,
        email -> Text,
        name -> Text,
    }
}

diesel::table! {
    #[sql_name = "MeterTable"]
    meters (id) {
        id -> BigInt,
        #[sql_name = "OAuthID"]
        oauth_id -> Nullable<Text>,
        metername -> Nullable<Text>,
        #[sql_name = "URL"]
        url -> Nullable<Text>,
        #[sql_name = "GUID"]
        guid -> Nullable<Text>,
        datetime -> Nullable<Timestamp>,
    }
}

diesel::table! {
    #[sql_name = "VoteTable"]
    votes (id) {
        id -> BigInt,
        #[sql_name = "meterID"]
        meter_id -> Nullable<BigInt>,
        #[sql_name = "Vote"]
        vote -> Nullable<Integer>,
        datetime -> Nullable<Timestamp>,
    }
}

// meters.oauth_id references a unique column rather than a primary key,
// which `joinable!` cannot express.
diesel::joinable!(votes -> meters (meter_id));

diesel::allow_tables_to_appear_in_same_query!(account_profile, meters, votes,);
