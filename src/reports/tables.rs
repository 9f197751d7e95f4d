use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dartstrat::accuracy::calibration::ThrowCollection;
use dartstrat::accuracy::AccuracyModel;
use dartstrat::geometry::{
    colour_of, contrasting_colour, BoardColour, BoardFrame, BoardPosition, Segment,
};
use dartstrat::search::{OneResult, ThrowReport, ThrowTally};
use dartstrat::targets::TargetComparison;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn segment_colour(segment: Segment) -> Color {
    match segment {
        Segment::Out => Color::DarkGrey,
        Segment::InnerBull | Segment::Double | Segment::Treble => Color::Red,
        Segment::OuterBull => Color::Green,
        Segment::InnerSingle | Segment::OuterSingle => Color::Reset,
    }
}

pub fn best_targets(model: &AccuracyModel, best: &[OneResult], top: usize) {
    println!("\n=== 🏆 TOP {} TARGETS ({}) ===", top, model);
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Target").add_attribute(Attribute::Bold),
        Cell::new("Radius"),
        Cell::new("Angle"),
        Cell::new("Average").fg(Color::Cyan),
    ]);
    align_right(&mut table, 2..=4);

    for (rank, r) in best.iter().enumerate() {
        let outcome = r.position.outcome();
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&outcome.label).fg(segment_colour(outcome.segment)),
            Cell::new(format!("{:.3}", r.position.radius)),
            Cell::new(format!("{:.1}", r.position.angle)),
            Cell::new(format!("{:.2}", r.score)).fg(Color::Cyan),
        ]);
    }
    println!("{}", table);
}

pub fn throws(model: &AccuracyModel, reports: &[ThrowReport], tally: &ThrowTally) {
    if let Some(first) = reports.first() {
        println!(
            "\n🎯 Aiming at {} (radius {:.3}, angle {:.1}) with {}",
            first.target.outcome().label,
            first.target.radius,
            first.target.angle,
            model
        );
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Landed"),
        Cell::new("Score"),
        Cell::new("Radius"),
        Cell::new("Angle"),
        Cell::new("Pixel"),
    ]);
    align_right(&mut table, 2..=4);

    for (i, r) in reports.iter().enumerate() {
        let (px, py) = r.landing_pixel.rounded();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.outcome.label).fg(segment_colour(r.outcome.segment)),
            Cell::new(r.outcome.score),
            Cell::new(format!("{:.3}", r.landing.radius)),
            Cell::new(format!("{:.1}", r.landing.angle)),
            Cell::new(format!("({}, {})", px, py)),
        ]);
    }
    println!("{}", table);

    match tally.average() {
        Some(avg) => println!(
            "Throws: {} | Total: {} | Average: {:.2}",
            tally.count, tally.total, avg
        ),
        None => println!("No throws."),
    }
}

fn colour_name(colour: BoardColour) -> &'static str {
    match colour {
        BoardColour::Black => "black",
        BoardColour::White => "white",
        BoardColour::Red => "red",
        BoardColour::Green => "green",
    }
}

pub fn position(position: &BoardPosition, frame: &BoardFrame) {
    let outcome = position.outcome();
    let colour = colour_of(outcome.segment, outcome.score);
    let (r, g, b) = contrasting_colour(colour);
    let (px, py) = frame.to_pixel(*position).rounded();

    let mut table = new_table();
    let rows = [
        ("Radius", format!("{:.4}", position.radius)),
        ("Angle", format!("{:.2}", position.angle)),
        ("Pixel", format!("({}, {})", px, py)),
        ("Segment", format!("{:?}", outcome.segment)),
        ("Label", outcome.label.clone()),
        ("Score", outcome.score.to_string()),
        ("Colour", colour_name(colour).to_string()),
        ("Marker", format!("rgb({}, {}, {})", r, g, b)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    println!("{}", table);
}

pub fn comparison(model: &AccuracyModel, compared: &[TargetComparison]) {
    println!("\n=== ⚖️  NAMED TARGETS ({}) ===", model);
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Target").add_attribute(Attribute::Bold),
        Cell::new("Key"),
        Cell::new("Average").fg(Color::Cyan),
    ]);
    align_right(&mut table, 2..=2);

    for c in compared {
        table.add_row(vec![
            Cell::new(&c.label).fg(segment_colour(c.position.outcome().segment)),
            Cell::new(c.target),
            Cell::new(format!("{:.2}", c.average)).fg(Color::Cyan),
        ]);
    }
    println!("{}", table);
}

pub fn calibration(collection: &mut ThrowCollection) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Targets").add_attribute(Attribute::Bold),
        Cell::new("Throws").add_attribute(Attribute::Bold),
        Cell::new("Std Dev").fg(Color::Cyan),
    ]);
    align_right(&mut table, 0..=2);
    table.add_row(vec![
        Cell::new(collection.num_targets()),
        Cell::new(collection.num_throws()),
        Cell::new(collection.std_dev_string()).fg(Color::Cyan),
    ]);
    println!("{}", table);
}
