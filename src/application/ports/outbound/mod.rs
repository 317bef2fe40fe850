//! Outbound ports - contracts the infrastructure layer implements

mod provider_port;
mod repository_port;
mod sync_port;

pub use provider_port::{CharacterProviderPort, MonsterTemplateProviderPort, PartyProviderPort};
pub use repository_port::{
    CombatLogRepositoryPort, CombatantRepositoryPort, EncounterRepositoryPort,
};
pub use sync_port::{ChangeNotification, ChangeNotifierPort, ChangeTopic};
