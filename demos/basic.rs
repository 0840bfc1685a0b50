use observer::MisraGries;

fn main() {
    // Track at most 4 distinct words at a time. Anything occurring more than
    // n / 5 times in a stream of n words is guaranteed to survive.
    let mut summary: MisraGries = MisraGries::new(4).unwrap();

    let text = "the cat sat on the mat and the dog sat on the log";
    for word in text.split_whitespace() {
        summary.insert(word);
    }

    println!("Top words and their approximate counts:");
    for entry in summary.top(3) {
        println!("{}: {}", entry.item, entry.count);
    }

    println!(
        "\nSaw {} words, counts may be low by at most {}",
        summary.stream_weight(),
        summary.maximum_error()
    );

    // Thin the table explicitly, keeping the stronger half
    let dropped = summary.purge(None);
    println!("Purged {} low-count entries, {} remain", dropped, summary.len());
}
