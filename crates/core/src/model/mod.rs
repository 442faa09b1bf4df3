mod attributes;
mod ids;
mod locale;
mod question;

pub use attributes::{AttributeError, SessionAttributes};
pub use ids::{ParseIdError, RequestId, SessionId};
pub use locale::{Locale, LocaleError};
pub use question::{OPTION_COUNT, Question, QuestionError};
