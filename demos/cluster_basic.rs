use clusterboss::{Catalog, ClusterOptions, GreedyClusterer};

fn main() -> anyhow::Result<()> {
    // Synthetic selection round: two families plus a few stragglers
    let counts = vec![
        ("GGACTTAGCA", 1200u64),
        ("GGACTTAGCT", 340),
        ("GGACTAAGCA", 120),
        ("CCTGAATCGA", 800),
        ("CCTGAATCGT", 95),
        ("TTTTGGGGCC", 12),
        ("ACACACACAC", 3),
    ];
    let mut catalog = Catalog::from_pairs(counts)?;

    let opts = ClusterOptions {
        dist_cutoff: 2,
        min_seqs: 2,
        min_abd: 1,
        min_abd_center: 10,
        allow_recycle: false,
        keep_unclustered: true,
        parallel_dist_checks: true, // enable parallel checks if built with `--features parallel`
    };

    let res = GreedyClusterer::new(&mut catalog, opts).run()?;
    for peak in &res.peaks {
        println!(">Peak {}", peak.rank);
        for m in &peak.members {
            let rec = catalog.get(m.id);
            println!(
                "  {:>2} {} abd={} freq={:.4} dist={}",
                m.local_rank,
                rec.sequence(),
                rec.abundance(),
                catalog.frequency_of(m.id),
                m.distance
            );
        }
    }
    for &id in &res.leftovers {
        println!("leftover: {}", catalog.get(id).sequence());
    }
    Ok(())
}
