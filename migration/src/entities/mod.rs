pub mod collection;
pub mod disbursement;
pub mod instrument;
pub mod instrument_balance;
pub mod instrument_renewal;
pub mod instrument_withdrawal;
pub mod user;

pub use collection::Entity as CollectionEntity;
pub use disbursement::Entity as DisbursementEntity;
pub use instrument::Entity as InstrumentEntity;
pub use instrument_balance::Entity as InstrumentBalanceEntity;
pub use instrument_renewal::Entity as InstrumentRenewalEntity;
pub use instrument_withdrawal::Entity as InstrumentWithdrawalEntity;
pub use user::Entity as UserEntity;
