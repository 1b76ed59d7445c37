pub mod answer;
pub mod question;
pub mod vote;

pub use answer::Entity as Answer;
pub use question::Entity as Question;
pub use vote::Entity as Vote;
pub use vote::VoteKind;
