pub mod inventory;
pub mod mock_inventory;
pub mod telegram;
