mod lexer_test;
mod expression_test;
mod directive_test;
mod block_test;
