diesel::table! {
    card_bin (bin_number) {
        bin_number -> Text,
        status_id -> Text,
    }
}

diesel::table! {
    card_issued (card_id) {
        card_id -> Text,
        provider_id -> Text,
        provider_card_id -> Text,
        wallet_id -> Text,
        status_id -> Text,
        bin_number -> Text,
        last_digits -> Text,
        expiration_date -> Timestamptz,
        valid_date -> Text,
        cardholder_first_name -> Text,
        cardholder_last_name -> Text,
        other_data -> Json,
    }
}

diesel::table! {
    pmtol_klvmap (key_index) {
        key_index -> Text,
        key_name -> Text,
        key_descrp -> Text,
    }
}

diesel::table! {
    #[sql_name = "user"]
    users (user_id) {
        user_id -> Text,
        status_id -> Text,
    }
}

diesel::table! {
    wallet (wallet_id) {
        wallet_id -> Text,
        status_id -> Text,
        currency_numeric_code -> Text,
        current_balance -> Numeric,
        available_balance -> Numeric,
        blocked_balance -> Numeric,
        user_id -> Text,
        group_id -> Text,
    }
}

diesel::table! {
    wallet_group (group_id) {
        group_id -> Text,
        status_id -> Text,
    }
}

diesel::table! {
    wallet_transaction (transaction_id) {
        transaction_id -> Uuid,
        wallet_id -> Text,
        group_id -> Text,
        transaction_type_id -> Text,
        transaction_operation -> Text,
        transaction_date -> Timestamptz,
        transaction_amount -> Numeric,
        transaction_description -> Text,
        transaction_data -> Json,
        external_tx_id -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(card_issued -> card_bin (bin_number));
diesel::joinable!(card_issued -> wallet (wallet_id));
diesel::joinable!(wallet -> users (user_id));
diesel::joinable!(wallet -> wallet_group (group_id));
diesel::joinable!(wallet_transaction -> wallet (wallet_id));

diesel::allow_tables_to_appear_in_same_query!(
    card_bin,
    card_issued,
    pmtol_klvmap,
    users,
    wallet,
    wallet_group,
    wallet_transaction,
);
