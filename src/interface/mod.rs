pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_food_query, prompt_menu, prompt_path, prompt_pick_suggestion, prompt_quantity,
    prompt_unit, prompt_yes_no, MenuChoice,
};
pub use render::{display_entries, display_totals};
