//! Esquema Diesel, sincronizado a mano con `migrations/`.

diesel::table! {
    deployments (id) {
        id -> BigInt,
        name -> Text,
        tenant_id -> Text,
        category -> Nullable<Text>,
        deployment_key -> Nullable<Text>,
        version -> Integer,
        project_release_version -> Nullable<Text>,
        deployed_at -> Timestamptz,
    }
}

diesel::table! {
    deployment_resources (deployment_id, name) {
        deployment_id -> BigInt,
        name -> Text,
        bytes -> Bytea,
        generated -> Bool,
    }
}

diesel::joinable!(deployment_resources -> deployments (deployment_id));

diesel::allow_tables_to_appear_in_same_query!(deployments, deployment_resources,);
