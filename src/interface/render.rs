use crate::models::{FoodEntry, Totals};

/// Width of a full macro bar in characters.
const BAR_WIDTH: usize = 40;

/// Display the logged entries in a formatted table.
pub fn display_entries(entries: &[FoodEntry]) {
    if entries.is_empty() {
        println!("No foods logged yet.");
        return;
    }

    println!();
    println!("=== Logged Foods ===");
    println!();

    // Find max food name length for alignment
    let max_name_len = entries.iter().map(|e| e.name.len()).max().unwrap_or(10);

    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}. {:<width$} - {:>6.0} cal | P {:>5.1}g C {:>5.1}g F {:>5.1}g | {:>6.1}g",
            i + 1,
            entry.name,
            entry.calories,
            entry.protein,
            entry.carbs,
            entry.fat,
            entry.weight,
            width = max_name_len
        );
    }

    println!();
}

/// Display totals plus a proportional macro bar.
pub fn display_totals(totals: &Totals) {
    println!();
    println!("--- Totals ---");
    println!("Calories: {:.0}", totals.calories);
    println!("Protein:  {:.1} g", totals.protein);
    println!("Carbs:    {:.1} g", totals.carbs);
    println!("Fat:      {:.1} g", totals.fat);
    println!("Weight:   {:.1} g", totals.weight);
    println!();

    if totals.calories > 0.0 {
        print_macro_bar("Protein", totals.protein_pct());
        print_macro_bar("Carbs", totals.carbs_pct());
        print_macro_bar("Fat", totals.fat_pct());
        println!();
    }
}

fn print_macro_bar(label: &str, pct: f64) {
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    println!(
        "{:<8} [{}{}] {:>5.1}%",
        label,
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        pct
    );
}
