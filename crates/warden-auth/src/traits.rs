//! Projection of free-form identity traits onto fixed string fields.

use serde_json::Value;

/// The trait keys Warden lifts out of an identity's trait bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitField {
    /// `email`
    Email,
    /// `username`
    Username,
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `phone`
    Phone,
    /// `subscription_plan`
    SubscriptionPlan,
    /// `avatar`
    Avatar,
}

impl TraitField {
    /// Every recognized field, in schema order.
    pub const ALL: [TraitField; 7] = [
        TraitField::Email,
        TraitField::Username,
        TraitField::FirstName,
        TraitField::LastName,
        TraitField::Phone,
        TraitField::SubscriptionPlan,
        TraitField::Avatar,
    ];

    /// The key used in the trait bag.
    pub fn key(self) -> &'static str {
        match self {
            TraitField::Email => "email",
            TraitField::Username => "username",
            TraitField::FirstName => "first_name",
            TraitField::LastName => "last_name",
            TraitField::Phone => "phone",
            TraitField::SubscriptionPlan => "subscription_plan",
            TraitField::Avatar => "avatar",
        }
    }
}

/// Read a string trait out of a trait bag.
///
/// Returns `""` when the bag is null or not an object, the key is missing,
/// or the value is not a string. Never fails.
pub fn project(traits: &Value, key: &str) -> String {
    traits
        .as_object()
        .and_then(|map| map.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// The fixed trait fields of an identity, already projected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedTraits {
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// Subscription plan identifier.
    pub subscription_plan: String,
    /// Avatar URL.
    pub avatar: String,
}

impl ProjectedTraits {
    /// Project every recognized field out of `traits`.
    pub fn from_traits(traits: &Value) -> Self {
        let get = |field: TraitField| project(traits, field.key());
        Self {
            email: get(TraitField::Email),
            username: get(TraitField::Username),
            first_name: get(TraitField::FirstName),
            last_name: get(TraitField::LastName),
            phone: get(TraitField::Phone),
            subscription_plan: get(TraitField::SubscriptionPlan),
            avatar: get(TraitField::Avatar),
        }
    }
}
