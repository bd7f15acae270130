use core::fmt::Write;

pub fn nth(n: usize) -> String {
    let mut buf = String::with_capacity(n.checked_ilog10().map_or(1, |x| x + 1) as usize + 2);
    let _ = write!(&mut buf, "{n}");
    if n / 10 % 10 == 1 {
        buf.push_str("th");
    } else {
        match n % 10 {
            1 => buf.push_str("st"),
            2 => buf.push_str("nd"),
            3 => buf.push_str("rd"),
            _ => buf.push_str("th"),
        }
    }
    buf
}

pub fn base_name(base: u8) -> String {
    match base {
        0 => "plate".to_owned(),
        4 => "home".to_owned(),
        n => nth(n as usize),
    }
}

// fielding positions are numbered 1 (pitcher) through 9 (right field)
pub fn position_abbreviation(position: u8) -> &'static str {
    match position {
        1 => "P",
        2 => "C",
        3 => "1B",
        4 => "2B",
        5 => "3B",
        6 => "SS",
        7 => "LF",
        8 => "CF",
        9 => "RF",
        _ => "?",
    }
}
