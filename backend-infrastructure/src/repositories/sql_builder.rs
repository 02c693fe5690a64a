use backend_domain::{ContainerFilter, LogFilter, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

const LOG_COLUMNS: &str = "id, time, playerName, action, detail, world, x, y, z";
const CONTAINER_COLUMNS: &str =
    "id, time, playerName, action, container_type, material, amount, world, x, y, z";

#[derive(Default)]
struct Conditions {
    clauses: Vec<&'static str>,
    params: Vec<SqlParam>,
}

impl Conditions {
    fn push(&mut self, clause: &'static str, param: SqlParam) {
        self.clauses.push(clause);
        self.params.push(param);
    }

    fn render(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn contains_pattern(needle: &str) -> SqlParam {
    SqlParam::Text(format!("%{needle}%"))
}

fn log_conditions(filter: &LogFilter) -> Conditions {
    let mut cond = Conditions::default();
    if let Some(player) = &filter.player {
        cond.push("playerName = ?", SqlParam::Text(player.clone()));
    }
    if let Some(action) = filter.action {
        cond.push("action = ?", SqlParam::Int(i64::from(action.code())));
    }
    if let Some(needle) = &filter.detail_contains {
        cond.push("detail LIKE ?", contains_pattern(needle));
    }
    if let Some(from) = filter.from {
        cond.push("time >= ?", SqlParam::Int(i64::from(from)));
    }
    if let Some(to) = filter.to {
        cond.push("time <= ?", SqlParam::Int(i64::from(to)));
    }
    cond
}

fn container_conditions(filter: &ContainerFilter) -> Conditions {
    let mut cond = Conditions::default();
    if let Some(player) = &filter.player {
        cond.push("playerName = ?", SqlParam::Text(player.clone()));
    }
    if let Some(needle) = &filter.material_contains {
        cond.push("material LIKE ?", contains_pattern(needle));
    }
    if let Some(direction) = filter.direction {
        cond.push("action = ?", SqlParam::Int(i64::from(direction.code())));
    }
    cond
}

fn paged(table: &str, columns: &str, cond: Conditions, page: PageRequest) -> SqlQuery {
    let order = page.sort.as_sql();
    let sql = format!(
        "SELECT {columns} FROM {table}{} ORDER BY time {order}, id {order} LIMIT ? OFFSET ?",
        cond.render()
    );
    let mut params = cond.params;
    params.push(SqlParam::Int(i64::from(page.size)));
    params.push(SqlParam::Int(page.offset() as i64));
    SqlQuery { sql, params }
}

fn counted(table: &str, cond: Conditions) -> SqlQuery {
    SqlQuery {
        sql: format!("SELECT COUNT(*) FROM {table}{}", cond.render()),
        params: cond.params,
    }
}

pub fn select_logs(filter: &LogFilter, page: PageRequest) -> SqlQuery {
    paged("logs", LOG_COLUMNS, log_conditions(filter), page)
}

pub fn count_logs(filter: &LogFilter) -> SqlQuery {
    counted("logs", log_conditions(filter))
}

pub fn count_by_action(filter: &LogFilter) -> SqlQuery {
    let cond = log_conditions(filter);
    SqlQuery {
        sql: format!(
            "SELECT action, COUNT(*) AS total FROM logs{} GROUP BY action ORDER BY total DESC, action ASC",
            cond.render()
        ),
        params: cond.params,
    }
}

pub fn select_container_transactions(filter: &ContainerFilter, page: PageRequest) -> SqlQuery {
    paged(
        "container_transactions",
        CONTAINER_COLUMNS,
        container_conditions(filter),
        page,
    )
}

pub fn count_container_transactions(filter: &ContainerFilter) -> SqlQuery {
    counted("container_transactions", container_conditions(filter))
}

pub const DISTINCT_PLAYERS_SQL: &str = "SELECT DISTINCT playerName FROM logs ORDER BY playerName";
pub const DISTINCT_ACTIONS_SQL: &str = "SELECT DISTINCT action FROM logs ORDER BY action";

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{ActionKind, SortOrder, TransferDirection};

    #[test]
    fn empty_filter_has_no_where_clause() {
        let query = select_logs(&LogFilter::default(), PageRequest::new(1, 25, SortOrder::Desc));
        assert_eq!(
            query.sql,
            "SELECT id, time, playerName, action, detail, world, x, y, z FROM logs \
             ORDER BY time DESC, id DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(query.params, vec![SqlParam::Int(25), SqlParam::Int(0)]);
    }

    #[test]
    fn criteria_are_and_combined_and_bound() {
        let filter = LogFilter::new()
            .player("Alice")
            .action(ActionKind::Login)
            .detail_contains("chest");
        let query = select_logs(&filter, PageRequest::new(3, 10, SortOrder::Asc));
        assert_eq!(
            query.sql,
            "SELECT id, time, playerName, action, detail, world, x, y, z FROM logs \
             WHERE playerName = ? AND action = ? AND detail LIKE ? \
             ORDER BY time ASC, id ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            query.params,
            vec![
                SqlParam::Text("Alice".into()),
                SqlParam::Int(6),
                SqlParam::Text("%chest%".into()),
                SqlParam::Int(10),
                SqlParam::Int(20),
            ]
        );
    }

    #[test]
    fn injected_text_stays_in_parameters() {
        let filter = LogFilter::new().player("x' OR '1'='1");
        let query = count_logs(&filter);
        assert_eq!(query.sql, "SELECT COUNT(*) FROM logs WHERE playerName = ?");
        assert_eq!(query.params, vec![SqlParam::Text("x' OR '1'='1".into())]);
    }

    #[test]
    fn time_bounds_and_container_filters() {
        let filter = LogFilter::new().between(Some(100), Some(200));
        assert_eq!(
            count_logs(&filter).sql,
            "SELECT COUNT(*) FROM logs WHERE time >= ? AND time <= ?"
        );

        let filter = ContainerFilter {
            player: Some("Ann".into()),
            material_contains: Some("DIAMOND".into()),
            direction: Some(TransferDirection::PlacedIn),
        };
        let query = count_container_transactions(&filter);
        assert_eq!(
            query.sql,
            "SELECT COUNT(*) FROM container_transactions WHERE playerName = ? AND material LIKE ? AND action = ?"
        );
        assert_eq!(query.params[2], SqlParam::Int(1));
    }
}
