//! Demo data for local runs.
//!
//! Registers two owners with one property each and one guest, plus a bearer
//! token per account, so the API can be exercised with plain `curl`.

use crate::identity::InMemoryIdentityProvider;
use crate::properties::{PropertyStore, Result};
use crate::types::{GuestId, OwnerId, Principal, Property, PropertyId};
use chrono::{DateTime, Utc};

/// Token for `john@doe.com.br`, owner of "Apartamento Novo"
pub const OWNER_TOKEN: &str = "john-token";
/// Token for `jane@doe.com.br`, owner of "Apartamento Vintage"
pub const OTHER_OWNER_TOKEN: &str = "jane-token";
/// Token for `andrew@doe.com.br`, a guest
pub const GUEST_TOKEN: &str = "andrew-token";

/// What [`seed_demo_data`] registered
#[derive(Debug, Clone)]
pub struct DemoData {
    /// John's property
    pub property_id: PropertyId,
    /// Jane's property
    pub other_property_id: PropertyId,
    /// John
    pub owner_id: OwnerId,
    /// Andrew
    pub guest_id: GuestId,
}

/// Register the demo accounts, their tokens and properties.
///
/// # Errors
///
/// Returns the property store error if a listing cannot be stored.
pub async fn seed_demo_data(
    properties: &dyn PropertyStore,
    identity: &InMemoryIdentityProvider,
    now: DateTime<Utc>,
) -> Result<DemoData> {
    let john = OwnerId::new();
    let jane = OwnerId::new();
    let andrew = GuestId::new();

    identity
        .register(
            OWNER_TOKEN,
            Principal::Owner {
                id: john,
                email: "john@doe.com.br".to_string(),
            },
        )
        .await;
    identity
        .register(
            OTHER_OWNER_TOKEN,
            Principal::Owner {
                id: jane,
                email: "jane@doe.com.br".to_string(),
            },
        )
        .await;
    identity
        .register(
            GUEST_TOKEN,
            Principal::Guest {
                id: andrew,
                email: "andrew@doe.com.br".to_string(),
            },
        )
        .await;

    let apartamento_novo = Property {
        id: PropertyId::new(),
        owner_id: john,
        owner_email: "john@doe.com.br".to_string(),
        title: "Apartamento Novo".to_string(),
        description: "Um apartamento novo, perto da praia".to_string(),
        rooms: 3,
        bathrooms: 2,
        pets_allowed: true,
        daily_rate_cents: 10_000,
        property_type: "Apartamento".to_string(),
        created_at: now,
    };
    let apartamento_vintage = Property {
        id: PropertyId::new(),
        owner_id: jane,
        owner_email: "jane@doe.com.br".to_string(),
        title: "Apartamento Vintage".to_string(),
        description: "Um apartamento charmoso no centro".to_string(),
        rooms: 2,
        bathrooms: 1,
        pets_allowed: false,
        daily_rate_cents: 8_000,
        property_type: "Apartamento".to_string(),
        created_at: now,
    };

    let data = DemoData {
        property_id: apartamento_novo.id,
        other_property_id: apartamento_vintage.id,
        owner_id: john,
        guest_id: andrew,
    };

    properties.insert(apartamento_novo).await?;
    properties.insert(apartamento_vintage).await?;

    tracing::info!(
        property_id = %data.property_id,
        owner_token = OWNER_TOKEN,
        guest_token = GUEST_TOKEN,
        "Demo data seeded"
    );
    Ok(data)
}
