use super::*;

pub trait AstRecurse {
    fn recurse<V: Visitor<Output = ()>>(&self, visitor: &mut V);
}

macro_rules! define_visitor {
    ($( $type:ident { $( $name:ident ( $arg:ident : $ty:ty ) );+ $(;)? } )+) => {
        pub trait Visitor
        where
            Self: Sized,
        {
            type Output;

            $(
                $(
                    fn $name(&mut self, $arg: &$ty) -> Self::Output;
                )+
            )+
        }

        /// A visitor that walks the whole tree unless told otherwise.
        pub trait DefaultVisitor
        where
            Self: Sized,
        {
            $( define_visitor!(@ $type { $( $name ( $arg : &$ty ); )+ } ); )+
        }

        impl<T> Visitor for T
        where
            T: DefaultVisitor,
        {
            type Output = ();

            $(
                $(
                    fn $name(&mut self, $arg: &$ty) {
                        <Self as DefaultVisitor>::$name(self, $arg);
                    }
                )+
            )+
        }
    };

    (@ NonTerminal { $( $name:ident ( $arg:ident : $ty:ty ); )+ }) => {
        $(
            fn $name(&mut self, $arg: $ty) {
                $arg.recurse(self);
            }
        )+
    };

    (@ Terminal { $( $name:ident ( $arg:ident : $ty:ty ); )+ }) => {
        $(
            #[allow(unused_variables)]
            fn $name(&mut self, $arg: $ty) {}
        )+
    };
}

define_visitor! {
    NonTerminal {
        visit_expression(expr: Expression);
        visit_drilldown(drilldown: Drilldown);
        visit_function_call(call: FunctionCall);
        visit_argument(arg: Argument);
        visit_literal(lit: Literal);
    }

    Terminal {
        visit_identifier(ident: Identifier);
        visit_named_literal(lit: NamedLiteral);
        visit_number_literal(lit: NumberLiteral);
        visit_string_literal(lit: StringLiteral);
    }
}

/// Collects the tokens a tree was built from, in source order.
#[derive(Debug, Default)]
pub struct TokenCollector {
    tokens: Vec<Token>,
}

impl TokenCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn push(&mut self, token: impl Into<Token>) {
        self.tokens.push(token.into());
    }
}

impl Visitor for TokenCollector {
    type Output = ();

    fn visit_expression(&mut self, expr: &Expression) {
        expr.recurse(self);
    }

    fn visit_drilldown(&mut self, drilldown: &Drilldown) {
        match drilldown {
            Drilldown::Period { period, property } => {
                self.push(*period);
                self.visit_identifier(property);
            }

            Drilldown::Brackets { open, index, close } => {
                self.push(*open);
                self.visit_expression(index);
                self.push(*close);
            }
        }
    }

    fn visit_function_call(&mut self, call: &FunctionCall) {
        self.push(Token::Identifier(call.name.clone()));
        self.push(call.open_paren);
        call.recurse(self);
        self.push(call.close_paren);
    }

    fn visit_argument(&mut self, arg: &Argument) {
        self.visit_expression(&arg.value);

        if let Some(comma) = arg.comma {
            self.push(comma);
        }
    }

    fn visit_literal(&mut self, lit: &Literal) {
        lit.recurse(self);
    }

    fn visit_identifier(&mut self, ident: &Identifier) {
        self.push(Token::Identifier(ident.name.clone()));
    }

    fn visit_named_literal(&mut self, lit: &NamedLiteral) {
        self.push(*lit);
    }

    fn visit_number_literal(&mut self, lit: &NumberLiteral) {
        if let Some(sign) = lit.sign {
            self.push(sign);
        }

        self.push(Token::DigitSequence(lit.integer_part.clone()));

        if let Some(DecimalPart {
            point,
            fractional_part,
        }) = &lit.decimal
        {
            self.push(*point);

            if let Some(digits) = fractional_part {
                self.push(Token::DigitSequence(digits.clone()));
            }
        }
    }

    fn visit_string_literal(&mut self, lit: &StringLiteral) {
        self.push(Token::StringLiteral {
            content: lit.content.clone(),
            delimiter: lit.delimiter,
        });
    }
}
