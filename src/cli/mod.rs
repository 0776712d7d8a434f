pub mod commands;
pub mod output;

pub use commands::{export_skill, list_skills, new_skill, validate_skill};
pub use output::{
    print_error, print_header, print_hint, print_info, print_key_value, print_list_item,
    print_subheader, print_success, print_title, print_warn,
    Icons,
};
