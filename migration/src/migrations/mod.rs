pub mod m202608200001_create_attendance;
