use std::ops::RangeInclusive;

/// Built-in operators, recognized in the head position of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Is,
    Add,
    Sub,
    Mul,
    Div,
    Like,
    Ilike,
    Strftime,
    Extract,
    In,
    Concat,
}

/// Aggregate functions, recognized in the head position of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Min,
    Max,
    Sum,
    Avg,
    Every,
    Count,
    GroupConcat,
    StringAgg,
    ArrayAgg,
    JsonAgg,
    BoolOr,
    BoolAnd,
    JsonObjectAgg,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        use Builtin::*;

        Some(match name {
            "=" => Eq,
            "!=" => Ne,
            "<" => Lt,
            "<=" => Le,
            ">" => Gt,
            ">=" => Ge,
            "and" => And,
            "or" => Or,
            "not" => Not,
            "is" => Is,
            "+" => Add,
            "-" => Sub,
            "*" => Mul,
            "/" => Div,
            "like" => Like,
            "ilike" => Ilike,
            "strftime" => Strftime,
            "extract" => Extract,
            "in" => In,
            "||" => Concat,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        use Builtin::*;

        match self {
            Eq => "=",
            Ne => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            And => "and",
            Or => "or",
            Not => "not",
            Is => "is",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Like => "like",
            Ilike => "ilike",
            Strftime => "strftime",
            Extract => "extract",
            In => "in",
            Concat => "||",
        }
    }

    /// Number of operands accepted
    pub fn arity(self) -> RangeInclusive<usize> {
        use Builtin::*;

        match self {
            Eq | Ne | Lt | Le | Gt | Ge | Is | Like | Ilike | Strftime | Extract => 2..=2,
            Not => 1..=1,
            Sub => 1..=usize::MAX,
            And | Or => 1..=usize::MAX,
            Add | Mul | Div | In | Concat => 2..=usize::MAX,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Builtin::Add | Builtin::Sub | Builtin::Mul | Builtin::Div)
    }

    /// Operators producing a boolean
    pub fn is_predicate(self) -> bool {
        use Builtin::*;

        matches!(
            self,
            Eq | Ne | Lt | Le | Gt | Ge | And | Or | Not | Is | Like | Ilike | In
        )
    }
}

impl Aggregate {
    pub fn from_name(name: &str) -> Option<Aggregate> {
        use Aggregate::*;

        Some(match name {
            "min" => Min,
            "max" => Max,
            "sum" => Sum,
            "avg" => Avg,
            "every" => Every,
            "count" => Count,
            "group_concat" => GroupConcat,
            "string_agg" => StringAgg,
            "array_agg" => ArrayAgg,
            "json_agg" => JsonAgg,
            "bool_or" => BoolOr,
            "bool_and" => BoolAnd,
            "json_object_agg" => JsonObjectAgg,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        use Aggregate::*;

        match self {
            Min => "min",
            Max => "max",
            Sum => "sum",
            Avg => "avg",
            Every => "every",
            Count => "count",
            GroupConcat => "group_concat",
            StringAgg => "string_agg",
            ArrayAgg => "array_agg",
            JsonAgg => "json_agg",
            BoolOr => "bool_or",
            BoolAnd => "bool_and",
            JsonObjectAgg => "json_object_agg",
        }
    }

    pub fn arity(self) -> RangeInclusive<usize> {
        use Aggregate::*;

        match self {
            Count => 0..=1,
            GroupConcat | StringAgg => 1..=2,
            JsonObjectAgg => 2..=2,
            _ => 1..=1,
        }
    }
}
