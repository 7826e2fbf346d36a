pub mod brisbane;
pub mod dublin;
pub mod portland;
pub mod queenstown;
pub mod vancouver;
pub mod wellington;
