use sqlx::{QueryBuilder, Sqlite};

/// 查询构建器（SQLite）/ Filtered SELECT builder
///
/// Thin wrapper over [`QueryBuilder`] that takes care of `WHERE` / `AND`
/// joining so list endpoints can add optional filters one by one.
pub struct SelectBuilder<'a> {
    qb: QueryBuilder<'a, Sqlite>,
    has_where: bool,
}

impl<'a> SelectBuilder<'a> {
    /// `base` 为不含 WHERE 的 SELECT 语句
    pub fn new(base: &str) -> Self {
        Self {
            qb: QueryBuilder::new(base),
            has_where: false,
        }
    }

    fn join(&mut self) {
        self.qb
            .push(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;
    }

    /// where 片段 + 绑定值，例如 `where_bind("c.fecha = ", fecha)`
    pub fn where_bind<T>(mut self, expr: &str, val: T) -> Self
    where
        T: 'a + sqlx::Encode<'a, Sqlite> + sqlx::Type<Sqlite> + Send,
    {
        self.join();
        self.qb.push(expr);
        self.qb.push_bind(val);
        self
    }

    /// 可选过滤：值为 `None` 时跳过
    pub fn where_opt<T>(self, expr: &str, val: Option<T>) -> Self
    where
        T: 'a + sqlx::Encode<'a, Sqlite> + sqlx::Type<Sqlite> + Send,
    {
        match val {
            Some(v) => self.where_bind(expr, v),
            None => self,
        }
    }

    /// 无绑定的 where 片段
    pub fn where_raw(mut self, expr: &str) -> Self {
        self.join();
        self.qb.push(expr);
        self
    }

    /// `(col1 LIKE ? OR col2 LIKE ? ...)`，模式为 `%term%`
    pub fn where_like_any(mut self, cols: &[&str], term: &str) -> Self {
        let pattern = format!("%{}%", term.trim());
        self.join();
        self.qb.push("(");
        for (i, col) in cols.iter().enumerate() {
            if i > 0 {
                self.qb.push(" OR ");
            }
            self.qb.push(*col);
            self.qb.push(" LIKE ");
            self.qb.push_bind(pattern.clone());
        }
        self.qb.push(")");
        self
    }

    pub fn group_by(mut self, expr: &str) -> Self {
        self.qb.push(" GROUP BY ");
        self.qb.push(expr);
        self
    }

    pub fn order_by(mut self, expr: &str) -> Self {
        self.qb.push(" ORDER BY ");
        self.qb.push(expr);
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.qb.push(" LIMIT ");
        self.qb.push_bind(n);
        self
    }

    pub fn into_inner(self) -> QueryBuilder<'a, Sqlite> {
        self.qb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_joining() {
        let qb = SelectBuilder::new("SELECT * FROM citas")
            .where_opt("fecha = ", Some("2026-10-18"))
            .where_opt::<i64>("cliente_id = ", None)
            .where_raw("estado <> 'cancelada'")
            .group_by("hora")
            .order_by("hora ASC")
            .limit(10)
            .into_inner();
        assert_eq!(
            qb.sql(),
            "SELECT * FROM citas WHERE fecha = ? AND estado <> 'cancelada' GROUP BY hora ORDER BY hora ASC LIMIT ?"
        );
    }

    #[test]
    fn test_like_any() {
        let qb = SelectBuilder::new("SELECT * FROM clientes")
            .where_like_any(&["nombre", "email"], "ana")
            .into_inner();
        assert_eq!(
            qb.sql(),
            "SELECT * FROM clientes WHERE (nombre LIKE ? OR email LIKE ?)"
        );
    }
}
