use console::Style;

pub const DASHES: usize = 50;

pub fn print_rule(ch: char) {
    println!("{}", Style::new().dim().apply_to(ch.to_string().repeat(DASHES)));
}

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("─".repeat(title.len())));
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("ERROR:"), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", Style::new().yellow().bold().apply_to("WARNING:"), msg);
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

pub fn print_step(step: &str) {
    println!("{}", Style::new().dim().apply_to(step));
}
