pub mod attendance_record;
pub mod class_session;
