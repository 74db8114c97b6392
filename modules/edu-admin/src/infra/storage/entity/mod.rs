pub mod em_class_info;
pub mod em_textbook_sup;
