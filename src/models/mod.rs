pub mod attendance;
pub mod event;
pub mod roll;
pub mod session;
pub mod student;

pub use attendance::{AttendanceRecord, NewAttendanceRecord};
pub use event::Event;
pub use roll::Roll;
pub use session::Session;
pub use student::{NewStudent, Student};
