//! Canned speech for every response the skill gives.

pub const LAUNCH: &str = "Hello! I can help you add events to your calendar. How can I help?";
pub const LAUNCH_REPROMPT: &str = "What event would you like to create?";

pub const EVENT_CREATED: &str = "Event created successfully!";
pub const EVENT_FAILED: &str =
    "Sorry, there was a problem creating the event. Please try again.";

pub const HELP: &str = "You can ask me to create an event. For example, you can say: \
                        create an event called standup on fifteen January at ten o'clock.";
pub const HELP_REPROMPT: &str = "What would you like to do?";

pub const GOODBYE: &str = "Goodbye!";

pub const FALLBACK: &str =
    "Hmm, I'm not sure. You can say hello or help. What would you like to do?";
pub const FALLBACK_REPROMPT: &str = "Sorry, I didn't understand. How can I help?";

pub const GENERIC_ERROR: &str =
    "Sorry, there was a problem processing your request. Please try again.";

/// Diagnostic speech naming the intent that was triggered.
pub fn intent_reflection(intent_name: &str) -> String {
    format!("You just triggered the {} intent.", intent_name)
}
