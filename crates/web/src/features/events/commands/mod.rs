mod add_event_result;
mod create_event;
mod create_event_round;
mod delete_event;
mod delete_event_user;
mod get_event;
mod get_event_round;
mod get_event_user;
mod remove_event_result;
mod update_event;
mod update_event_round;
mod update_event_user;

pub use add_event_result::AddEventResultCommand;
pub use create_event::CreateEventCommand;
pub use create_event_round::CreateEventRoundCommand;
pub use delete_event::DeleteEventCommand;
pub use delete_event_user::DeleteEventUserCommand;
pub use get_event::GetEventCommand;
pub use get_event_round::GetEventRoundCommand;
pub use get_event_user::GetEventUserCommand;
pub use remove_event_result::RemoveEventResultCommand;
pub use update_event::UpdateEventCommand;
pub use update_event_round::UpdateEventRoundCommand;
pub use update_event_user::UpdateEventUserCommand;
