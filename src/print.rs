//! Console tabulation of the aggregated stats.

use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::stats::TeamSeasonStat;

pub fn tabulate(stats: &[TeamSeasonStat]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Season".into(), "Team".into(), "Avg diff".into()],
        ));
    for stat in stats {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                stat.season.to_string().into(),
                stat.team.clone().into(),
                format!("{:.2}", stat.avg_goal_diff).into(),
            ],
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    #[test]
    fn tabulate_stats() {
        let stats = vec![
            TeamSeasonStat {
                season: 2016,
                team: String::from("Arsenal"),
                avg_goal_diff: 0.305,
            },
            TeamSeasonStat {
                season: 2017,
                team: String::from("Arsenal"),
                avg_goal_diff: -1.5,
            },
        ];
        let rendered = format!("{}", Console::default().render(&tabulate(&stats)));
        assert!(rendered.contains("Arsenal"));
        assert!(rendered.contains("0.30"));
        assert!(rendered.contains("-1.50"));
    }

    #[test]
    fn tabulate_empty_stats() {
        let rendered = format!("{}", Console::default().render(&tabulate(&[])));
        assert!(rendered.contains("Season"));
        assert!(rendered.contains("Team"));
    }
}
